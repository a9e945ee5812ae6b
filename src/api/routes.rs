use actix_web::{delete, get, post, web, HttpResponse, Result as WebResult};

use crate::api::models::{ErrorBody, SessionView, SubmitRequest};
use crate::chat::{ChatController, ChatError};

fn rejection(err: ChatError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    match err {
        ChatError::EmptyInput => HttpResponse::BadRequest().json(body),
        ChatError::Busy => HttpResponse::Conflict().json(body),
    }
}

#[get("/session")]
pub async fn get_session(controller: web::Data<ChatController>) -> WebResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SessionView::snapshot(&controller)))
}

/// Blocks until the model has answered, then returns the whole session.
#[post("/messages")]
pub async fn submit_message(
    controller: web::Data<ChatController>,
    req: web::Json<SubmitRequest>,
) -> WebResult<HttpResponse> {
    let req = req.into_inner();

    match controller.submit(&req.text).await {
        Ok(_) => Ok(HttpResponse::Ok().json(SessionView::snapshot(&controller))),
        Err(e) => Ok(rejection(e)),
    }
}

#[delete("/session")]
pub async fn clear_session(controller: web::Data<ChatController>) -> WebResult<HttpResponse> {
    match controller.clear() {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(rejection(e)),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(get_session)
            .service(submit_message)
            .service(clear_session),
    );
}
