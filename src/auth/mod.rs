pub mod session;

pub use session::{EnvSessionProvider, SessionProvider, StaticSessionProvider};
