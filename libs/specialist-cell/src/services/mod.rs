pub mod specialist;
