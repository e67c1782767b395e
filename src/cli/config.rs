use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::auth::{CodeDelivery, ConsoleDelivery, FlowDelays, RelayDelivery};
use crate::config::{config, DeliveryMode};
use crate::context::AppContext;

/// Data directory from `TRACKER_DATA_DIR` or `$HOME/.config/expense-tracker`
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let data_dir = config().storage.resolve_dir()?;

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

pub fn open_context() -> anyhow::Result<AppContext> {
    Ok(AppContext::open_dir(get_data_dir()?)?)
}

pub fn build_delivery() -> anyhow::Result<Arc<dyn CodeDelivery>> {
    let delivery = &config().delivery;
    Ok(match delivery.mode {
        DeliveryMode::Console => Arc::new(ConsoleDelivery),
        DeliveryMode::Relay => Arc::new(RelayDelivery::new(delivery.relay_endpoint()?, delivery.timeout())),
    })
}

pub fn flow_delays() -> FlowDelays {
    let auth = &config().auth;
    FlowDelays::from_millis(auth.login_delay_ms, auth.verify_delay_ms)
}

pub fn allow_negative_expenses() -> bool {
    config().ledger.allow_negative_expenses
}

/// Today's date on the local calendar
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
