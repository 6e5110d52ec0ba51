pub mod datasheet;
