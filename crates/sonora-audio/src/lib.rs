mod decoder;
mod engine;
mod filter;
mod mixer;
mod output;

pub use decoder::{DecodedClip, decode_bytes};
pub use engine::{CpalEngine, VoiceHandle};
pub use filter::{Biquad, BiquadCoeffs, LOWPASS_Q};
pub use mixer::{Mixer, db_to_gain};
