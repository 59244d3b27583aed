pub mod array;
pub mod name;
pub mod reference;
pub mod scalar;
pub mod stream;
pub mod string;
