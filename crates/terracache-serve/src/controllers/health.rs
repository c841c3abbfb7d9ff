use std::sync::Arc;

use crate::router::{RequestContext, RouterAdapter};

use super::Controller;

pub const HEALTH_PATH: &str = "/ping";

#[derive(Debug, Default)]
pub struct HealthController;

impl Controller for HealthController {
    fn register(self: Arc<Self>, router: &mut dyn RouterAdapter) {
        router.get(HEALTH_PATH, Arc::new(|ctx: &mut RequestContext| ctx.json(200, &true)));
    }
}
