pub mod default_route;
