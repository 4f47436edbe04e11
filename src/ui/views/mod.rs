mod dashboard;
mod group_detail;
mod group_list;
mod home;
mod victim_detail;
mod victim_list;

pub use dashboard::DashboardView;
pub use group_detail::GroupDetailView;
pub use group_list::GroupListView;
pub use home::HomeView;
pub use victim_detail::VictimDetailView;
pub use victim_list::VictimListView;
