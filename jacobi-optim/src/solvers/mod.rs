pub mod gradient_descent;
pub mod newton;
