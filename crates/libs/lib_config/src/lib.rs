pub mod config {
    pub mod configuration;
}

pub mod db {
    pub mod db;
}
