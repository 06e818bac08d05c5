use actix_web::{HttpResponse, Responder};

/// Liveness probe. Does not touch the store.
pub async fn process() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn health_answers_ok() {
        let app =
            test::init_service(App::new().route("/health", web::get().to(process))).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "ok");
    }
}
