use actix_web::web;

use crate::handlers::{auth, plants, projects, settings, system::admin_health_check, uploads};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(admin_health_check)
            .service(auth::me)
            .service(projects::create_project)
            .service(projects::update_project)
            .service(projects::delete_project)
            .service(settings::update_website_settings)
            .service(settings::update_project_settings)
            .service(settings::publish_website)
            .service(uploads::upload_image)
            .service(plants::create_plant)
            .service(plants::update_plant)
            .service(plants::delete_plant)
    );
}
