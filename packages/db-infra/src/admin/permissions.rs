use crate::config::db::{database_name, with_database};
use crate::config::provision::{ExistingPolicy, ProvisionSettings};
use crate::error::DbInfraError;
use crate::provision::{
    run_plan, Ident, ObjectClass, ProvisionPlan, ProvisionReport, SeaOrmTarget, Step,
};

/// Result of the schema setup in one database.
#[derive(Debug)]
pub struct SchemaSetupOutcome {
    pub database: String,
    pub role: String,
    pub result: Result<ProvisionReport, DbInfraError>,
}

impl SchemaSetupOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

async fn run_on(database_url: &str, plan: &ProvisionPlan) -> Result<ProvisionReport, DbInfraError> {
    let mut target = SeaOrmTarget::connect(database_url).await?;
    let result = run_plan(plan, &mut target).await.map_err(DbInfraError::from);
    target.close().await;
    result
}

/// Steps that let `role` fully use the `public` schema of the test database,
/// for tables that already exist and for those created later.
pub fn test_permission_steps(database: &Ident, role: &Ident) -> Result<Vec<Step>, DbInfraError> {
    let public = Ident::new("public")?;
    let mut steps = vec![
        Step::GrantDatabase {
            database: database.clone(),
            role: role.clone(),
        },
        Step::GrantSchemaUsage {
            schema: public.clone(),
            role: role.clone(),
        },
    ];
    for class in [ObjectClass::Tables, ObjectClass::Sequences] {
        steps.push(Step::GrantExisting {
            schema: public.clone(),
            role: role.clone(),
            class,
        });
    }
    for class in [ObjectClass::Tables, ObjectClass::Sequences] {
        steps.push(Step::DefaultPrivileges {
            owner: None,
            schema: public.clone(),
            grantee: role.clone(),
            class,
        });
    }
    Ok(steps)
}

/// Set up the schema in the local and the test database.
///
/// Both databases are attempted even when the first one fails.
pub async fn setup_main_schema(
    settings: &ProvisionSettings,
) -> Result<Vec<SchemaSetupOutcome>, DbInfraError> {
    let schema = Ident::new(settings.schema.as_str())?;
    let local_database = database_name(&settings.admin_url)?;
    let targets = [
        (local_database, settings.local_role.clone()),
        (settings.test_database.clone(), settings.test_role.clone()),
    ];

    let mut outcomes = Vec::with_capacity(targets.len());
    for (database, role) in targets {
        let plan = ProvisionPlan::new(
            ProvisionPlan::schema_setup(&schema, &Ident::new(role.as_str())?)?,
            ExistingPolicy::Fail,
        );
        let url = with_database(&settings.admin_url, &database)?;
        let result = run_on(&url, &plan).await;
        outcomes.push(SchemaSetupOutcome {
            database,
            role,
            result,
        });
    }
    Ok(outcomes)
}

/// Grant the test role what it needs on the test database's `public` schema.
pub async fn fix_test_permissions(settings: &ProvisionSettings) -> Result<ProvisionReport, DbInfraError> {
    let database = Ident::new(settings.test_database.as_str())?;
    let role = Ident::new(settings.test_role.as_str())?;
    let plan = ProvisionPlan::new(test_permission_steps(&database, &role)?, ExistingPolicy::Fail);

    let url = with_database(&settings.admin_url, database.as_str())?;
    run_on(&url, &plan).await
}

/// Create the test database unless it already exists.
pub async fn create_test_database(settings: &ProvisionSettings) -> Result<ProvisionReport, DbInfraError> {
    let plan = ProvisionPlan::new(
        vec![Step::CreateDatabase {
            database: Ident::new(settings.test_database.as_str())?,
        }],
        ExistingPolicy::Skip,
    );
    run_on(&settings.admin_url, &plan).await
}
