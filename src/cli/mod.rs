pub mod site_info;
