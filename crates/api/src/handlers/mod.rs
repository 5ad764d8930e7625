pub mod auth;
pub mod dashboards;
pub mod layouts;
pub mod widgets;
