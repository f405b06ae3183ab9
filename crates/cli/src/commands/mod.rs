pub mod decode_arg;
pub mod hash;
pub mod inspect;
pub mod verify_tx;
