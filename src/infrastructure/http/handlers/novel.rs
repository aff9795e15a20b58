//! Novel HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateNovel, DeleteNovel, GetNovel, ListChapters, ListNovels, UpdateNovel,
};
use crate::infrastructure::http::dto::{
    ApiResponse, ChapterSummaryResponse, Empty, IdRequest, NovelResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::Principal;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateNovelRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// 部分更新，未提供的字段保持不变
#[derive(Debug, Deserialize)]
pub struct UpdateNovelRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChapterListResponse {
    pub novel_id: Uuid,
    pub novel_title: String,
    pub total: usize,
    pub chapters: Vec<ChapterSummaryResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建小说
pub async fn create_novel(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<CreateNovelRequest>,
) -> Result<Json<ApiResponse<NovelResponse>>, ApiError> {
    let command = CreateNovel {
        principal: principal.user_id(),
        title: req.title,
        description: req.description,
        category: req.category,
    };

    let novel = state.create_novel_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(novel.into())))
}

/// 获取当前用户的小说列表
pub async fn list_novels(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<ApiResponse<Vec<NovelResponse>>>, ApiError> {
    let query = ListNovels {
        principal: principal.user_id(),
    };

    let novels = state.list_novels_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(
        novels.into_iter().map(NovelResponse::from).collect(),
    )))
}

/// 获取小说详情
pub async fn get_novel(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<NovelResponse>>, ApiError> {
    let query = GetNovel {
        principal: principal.user_id(),
        novel_id: req.id,
    };

    let novel = state.get_novel_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(novel.into())))
}

/// 更新小说
pub async fn update_novel(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<UpdateNovelRequest>,
) -> Result<Json<ApiResponse<NovelResponse>>, ApiError> {
    let command = UpdateNovel {
        principal: principal.user_id(),
        novel_id: req.id,
        title: req.title,
        description: req.description,
        cover: req.cover,
        category: req.category,
        status: req.status,
    };

    let novel = state.update_novel_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(novel.into())))
}

/// 删除小说及全部章节
pub async fn delete_novel(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let command = DeleteNovel {
        principal: principal.user_id(),
        novel_id: req.id,
    };

    state.delete_novel_handler.handle(command).await?;

    Ok(Json(ApiResponse::ok()))
}

/// 获取小说章节列表（按顺序）
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<ChapterListResponse>>, ApiError> {
    let query = ListChapters {
        principal: principal.user_id(),
        novel_id: req.id,
    };

    let result = state.list_chapters_handler.handle(query).await?;

    let chapters: Vec<ChapterSummaryResponse> = result
        .chapters
        .into_iter()
        .map(ChapterSummaryResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(ChapterListResponse {
        novel_id: result.novel_id,
        novel_title: result.novel_title,
        total: chapters.len(),
        chapters,
    })))
}
