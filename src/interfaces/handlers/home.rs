use actix_web::{HttpResponse, Responder};

pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Micro-app gallery service is running",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /health",
            "GET /gallery",
            "GET /api/gallery",
            "GET /api/microappgallery",
            "GET /api/cardgallery",
            "GET /api/categories",
            "GET /api/providers",
            "GET /api/micro-app/{id}",
            "GET /api/card/{id}",
            "POST /api/upvote/{id}",
            "POST /api/upvotemicroapp/{id}",
            "POST /api/upvotecard/{id}",
            "POST /api/downvote/{id}",
            "POST /api/publish",
            "POST /api/generate-micro-app",
            "POST /generate-card",
            "POST /upload-image",
            "POST /publish-preview",
            "GET /preview/{id}",
            "GET /published-preview/{id}"
        ]
    }))
}
