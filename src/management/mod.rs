mod token;

pub use token::TokenProvider;
pub use token::TokenStore;
