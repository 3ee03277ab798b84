mod files;
mod queries;
