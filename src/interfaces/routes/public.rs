use actix_web::web;

use crate::handlers::{plants, projects, published, settings, system::health_check};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    cfg.service(projects::list_projects)
        .service(projects::get_project);

    cfg.service(plants::list_plants)
        .service(plants::get_plant);

    cfg.service(settings::get_website_settings)
        .service(settings::website_status)
        .service(settings::get_project_settings);

    cfg.service(published::published_website)
        .service(published::published_projects);
}
