use db_infra::provision::ProvisionTarget;
use db_infra::{run_plan, ExistingPolicy, ProvisionPlan, ProvisionReport, ProvisionSettings, SeaOrmTarget};
use tracing::info;

use crate::error::DevtaskError;

/// `--skip-if-exists` forces `Skip`; otherwise `PROVISION_SKIP_EXISTING` decides.
pub fn apply_flag(settings: ProvisionSettings, skip_if_exists: bool) -> ProvisionSettings {
    if skip_if_exists {
        settings.with_existing(ExistingPolicy::Skip)
    } else {
        settings
    }
}

/// Build the plan from `settings` and run it against `target`.
pub async fn provision<T>(
    settings: &ProvisionSettings,
    target: &mut T,
) -> Result<ProvisionReport, DevtaskError>
where
    T: ProvisionTarget + ?Sized,
{
    let plan = ProvisionPlan::build(settings)?;
    info!(steps = plan.len(), existing = ?plan.existing(), "bootstrap=start");

    let report = run_plan(&plan, target).await?;
    info!(
        applied = report.applied(),
        skipped = report.skipped(),
        "bootstrap=done"
    );
    Ok(report)
}

/// Connect with the admin URL from the environment and provision.
pub async fn run(skip_if_exists: bool) -> Result<ProvisionReport, DevtaskError> {
    let settings = apply_flag(ProvisionSettings::from_env()?, skip_if_exists);
    let mut target = SeaOrmTarget::connect(&settings.admin_url).await?;

    let result = provision(&settings, &mut target).await;
    target.close().await;
    result
}
