//! Chapter HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    AutosaveChapter, CreateChapter, DeleteChapter, GetChapter, ReorderChapter, ReorderOutcome,
    UpdateChapter,
};
use crate::infrastructure::http::dto::{ApiResponse, ChapterResponse, Empty, IdRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::Principal;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub novel_id: Uuid,
    pub title: String,
    pub content: Option<String>,
}

/// 部分更新，未提供的字段保持不变
#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub is_gated: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AutosaveRequest {
    pub id: Uuid,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AutosaveResponse {
    pub word_count: usize,
    pub saved_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub id: Uuid,
    pub new_index: i64,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub status: &'static str, // "moved" | "unchanged"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u32>,
}

impl From<ReorderOutcome> for ReorderResponse {
    fn from(outcome: ReorderOutcome) -> Self {
        match outcome {
            ReorderOutcome::Unchanged => Self {
                status: "unchanged",
                from: None,
                to: None,
            },
            ReorderOutcome::Moved { from, to } => Self {
                status: "moved",
                from: Some(from),
                to: Some(to),
            },
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 新建章节（追加到末尾）
pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<CreateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = CreateChapter {
        principal: principal.user_id(),
        novel_id: req.novel_id,
        title: req.title,
        content: req.content,
    };

    let chapter = state.create_chapter_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 获取章节详情
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let query = GetChapter {
        principal: principal.user_id(),
        chapter_id: req.id,
    };

    let chapter = state.get_chapter_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 更新章节
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<UpdateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = UpdateChapter {
        principal: principal.user_id(),
        chapter_id: req.id,
        title: req.title,
        content: req.content,
        status: req.status,
        is_gated: req.is_gated,
    };

    let chapter = state.update_chapter_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 自动保存正文
pub async fn autosave_chapter(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<AutosaveRequest>,
) -> Result<Json<ApiResponse<AutosaveResponse>>, ApiError> {
    let command = AutosaveChapter {
        principal: principal.user_id(),
        chapter_id: req.id,
        content: req.content,
    };

    let result = state.autosave_chapter_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(AutosaveResponse {
        word_count: result.word_count,
        saved_at: result.saved_at.to_rfc3339(),
    })))
}

/// 删除章节
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let command = DeleteChapter {
        principal: principal.user_id(),
        chapter_id: req.id,
    };

    state.delete_chapter_handler.handle(command).await?;

    Ok(Json(ApiResponse::ok()))
}

/// 调整章节顺序
pub async fn reorder_chapter(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<ApiResponse<ReorderResponse>>, ApiError> {
    let command = ReorderChapter {
        principal: principal.user_id(),
        chapter_id: req.id,
        new_index: req.new_index,
    };

    let outcome = state.reorder_chapter_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(outcome.into())))
}
