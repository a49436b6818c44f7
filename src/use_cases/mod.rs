pub mod logout;
pub mod stream_audio;
pub mod telegram_login;
pub mod verify_token;

#[cfg(test)]
pub(crate) mod test_support;

pub use logout::LogoutUseCase;
pub use stream_audio::{AudioStream, MalformedRangePolicy, StreamAudioUseCase, StreamStatus};
pub use telegram_login::TelegramLoginUseCase;
pub use verify_token::VerifyTokenUseCase;
