mod sessions;

pub use sessions::InMemorySessionRepository;
