use actix_web::{get, web::Json};

use common::{context::GeneralContext, error};

use crate::service::dashboard::{Dashboard, DashboardService};

#[get("/api/dashboard")]
pub async fn get_dashboard(context: GeneralContext) -> error::Result<Json<Dashboard>> {
    Ok(Json(DashboardService::new(context).get().await?))
}
