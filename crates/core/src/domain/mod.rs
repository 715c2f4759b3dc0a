pub mod crop;
pub mod observation;
pub mod recommendation;
