mod dashboard_tests;
mod view_monitor_tests;
