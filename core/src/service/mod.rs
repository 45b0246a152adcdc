pub mod dto;
pub mod graph_service;
pub mod projector;
