use actix_web::{get, HttpResponse, Responder};
use std::env;

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Garden App API is running 🌿",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
