pub mod envfile;
