use crate::{config::Config, reports::ReportService, rooms::RoomService, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub rooms: RoomService,
    pub reports: ReportService,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            rooms: RoomService::new(store.clone()),
            reports: ReportService::new(store),
            config,
        }
    }
}
