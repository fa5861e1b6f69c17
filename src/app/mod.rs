//! Application use cases and transactions.

mod activity;
mod participant;
mod seed;

pub use activity::{
    create_activity, get_activity, list_activities, ActivityCreateReq, ActivityDto, ActivityMap,
};
pub use participant::{add_participant, remove_participant};
pub use seed::{initialize, SeedActivity, SeedData};
