pub mod room_repository;

pub use room_repository::RoomRepository;
