pub mod playback;
pub mod songs;
