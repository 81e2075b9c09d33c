//! Sample source objects and presenter classes.
//!
//! Mirrors a small payroll domain: employees with a manager, a list of
//! reports, an account number and a progress ratio.

use chrono::{Days, NaiveDate};
use glaze_engine::{ClassBuilder, Options, Record, Registry, Relation, Resolver, Result, Value};
use std::sync::Arc;

pub const EMPLOYEE_LIST: &str = "EmployeeListPresenter";
pub const EMPLOYEE: &str = "EmployeePresenter";
pub const SIMPLE_EMPLOYEE: &str = "SimpleEmployeePresenter";

/// Stand-in for a lazily loaded database relation.
#[derive(Debug, Clone)]
pub struct LazyRelation {
    rows: Vec<Value>,
}

impl LazyRelation {
    pub fn new<I, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }
}

impl Relation for LazyRelation {
    fn to_ordered_sequence(&self) -> Vec<Value> {
        self.rows.clone()
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Minimal employee: only `id` and `name`.
pub fn employee(id: i64, name: &str) -> Record {
    Record::new().with("id", id).with("name", name)
}

fn matt_without_manager() -> Record {
    employee(1, "matt")
        .with("start_date", date(1750, 12, 12))
        .with("job", "plumber")
        .with("account", "98765443322111")
        .with("progress", 10.98)
}

/// Manager of matt, with matt as the only report.
pub fn nick() -> Record {
    employee(2, "nick")
        .with("start_date", date(1350, 12, 12))
        .with("job", "electrician")
        .with("account", "1234567890")
        .with("progress", 55.5)
        .with("employees", vec![matt_without_manager()])
}

/// Employee managed by [`nick`].
pub fn matt() -> Record {
    matt_without_manager().with("manager", nick())
}

pub fn opts() -> Options {
    Options::from(serde_json::json!({
        "user": { "id": 100, "name": "Frank Rizzo" },
        "active": true
    }))
}

fn start_date_plus(presenter_source: &Value, days: u64) -> Value {
    presenter_source
        .member("start_date")
        .and_then(|value| value.as_date())
        .and_then(|start| start.checked_add_days(Days::new(days)))
        .into()
}

pub fn employee_list_class() -> Result<ClassBuilder> {
    Ok(ClassBuilder::new(EMPLOYEE_LIST)
        .fields(["active"], Resolver::new().manual())?
        .fields(["id", "name"], Resolver::new())?
        .fields(["user_id"], Resolver::new().method())?
        .fields(["user_name"], Resolver::new().method_named("current_user_name"))?
        .fields(["other_id"], Resolver::new().attribute("id"))?
        .fields(
            ["manager_name"],
            Resolver::new().attribute("name").through(["manager"]),
        )?
        .fields(
            ["renewal_date"],
            Resolver::new().attribute("start_date").transform(),
        )?
        .fields(["notify_date"], Resolver::new().method())?
        .fields(
            ["true_alias_value"],
            Resolver::new()
                .method_named("always_true")
                .true_alias("I am true alias."),
        )?
        .fields(
            ["false_alias_value"],
            Resolver::new()
                .method_named("always_false")
                .false_alias("I am false alias."),
        )?
        .fields(["null"], Resolver::new().null_alias("I am null."))?
        .fields(
            ["present"],
            Resolver::new().attribute("name").present_alias("I am present."),
        )?
        .fields(
            ["blank"],
            Resolver::new().attribute("nickname").blank_alias("I am blank."),
        )?
        .fields(["manager", "employees"], Resolver::new().presented_as(EMPLOYEE))?
        .fields(["account"], Resolver::new().mask())?
        .fields(["progress"], Resolver::new().percent())?
        .method("user_id", |presenter| Ok(presenter.dig_opt(&["user", "id"])))
        .method("current_user_name", |presenter| {
            Ok(presenter.dig_opt(&["user", "name"]))
        })
        .method("notify_date", |presenter| {
            Ok(start_date_plus(presenter.source(), 23))
        })
        .method("always_true", |_| Ok(Value::Bool(true)))
        .method("always_false", |_| Ok(Value::Bool(false)))
        .transform("renewal_date", |_, value| {
            Ok(value
                .as_date()
                .and_then(|start| start.checked_add_days(Days::new(24)))
                .into())
        })
        .hydrate(|presenter| {
            let active = presenter.dig_opt(&["active"]);
            presenter.set("active", active)
        }))
}

pub fn employee_class() -> Result<ClassBuilder> {
    Ok(ClassBuilder::new(EMPLOYEE)
        .extends(EMPLOYEE_LIST)
        .fields(["start_date", "job"], Resolver::new())?
        .fields(["founder", "owner"], Resolver::new().manual())?
        .hydrate(|presenter| {
            let founder = presenter
                .source()
                .member("id")
                .and_then(|id| id.as_i64())
                .is_some_and(|id| id < 10);
            presenter.set("founder", founder)
        })
        .hydrate(|presenter| {
            let owner = presenter.source().member("id") == Some(Value::Int(1));
            presenter.set("owner", owner)
        }))
}

pub fn simple_employee_class() -> Result<ClassBuilder> {
    ClassBuilder::new(SIMPLE_EMPLOYEE).fields(["id", "name"], Resolver::new())
}

/// Registry holding the three employee presenters.
pub fn employee_registry() -> Result<Arc<Registry>> {
    Registry::builder()
        .register(employee_list_class()?)?
        .register(employee_class()?)?
        .register(simple_employee_class()?)?
        .build()
}
