// Domain layer - Plain data types shared by the other layers
pub mod chart;
pub mod dashboard;
pub mod sample;
pub mod source;
pub mod trend;
