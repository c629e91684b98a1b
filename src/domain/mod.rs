pub mod params;
pub mod pcm;
pub mod session;
