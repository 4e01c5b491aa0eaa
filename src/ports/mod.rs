pub mod characters;
