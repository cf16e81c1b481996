//! Kernel - process-level infrastructure shared by the server routes.

pub mod jobs;
