mod read;
mod types;
