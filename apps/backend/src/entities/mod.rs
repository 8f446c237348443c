pub mod cities;
pub mod countries;
pub mod event_logs;
pub mod states;

pub use cities::Entity as Cities;
pub use cities::Model as City;
pub use countries::Entity as Countries;
pub use countries::Model as Country;
pub use event_logs::Entity as EventLogs;
pub use event_logs::Model as EventLog;
pub use states::Entity as States;
pub use states::Model as State;
