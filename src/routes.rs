use crate::{
    api::{attendance, employee, grid, holiday, project},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let api_limiter = build_limiter(config.rate_api_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/employees").service(
                    web::resource("")
                        .route(web::get().to(employee::list_employees))
                        .route(web::post().to(employee::create_employee)),
                ),
            )
            .service(
                web::scope("/masters").service(
                    web::resource("/holidays")
                        .route(web::get().to(holiday::list_holidays))
                        .route(web::post().to(holiday::create_holiday)),
                ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::post().to(attendance::save_attendance)),
                    )
                    // /attendance/grid — fixed segments before parameterized ones
                    .service(
                        web::resource("/grid")
                            .route(web::post().to(grid::open_grid))
                            .route(web::get().to(grid::get_grid)),
                    )
                    .service(web::resource("/grid/save").route(web::post().to(grid::save_grid)))
                    .service(
                        web::resource("/grid/{employee_id}")
                            .route(web::put().to(grid::fill_range)),
                    )
                    .service(
                        web::resource("/grid/{employee_id}/{date}")
                            .route(web::put().to(grid::set_cell)),
                    )
                    .service(web::resource("/statuses").route(web::get().to(grid::list_statuses))),
            )
            .service(
                web::scope("/projects")
                    // /projects
                    .service(
                        web::resource("")
                            .route(web::get().to(project::list_projects))
                            .route(web::post().to(project::create_project)),
                    )
                    .service(web::resource("/board").route(web::get().to(project::get_board)))
                    .service(
                        web::resource("/board/move").route(web::post().to(project::move_card)),
                    )
                    // /projects/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(project::update_project_status)),
                    ),
            ),
    );
}
