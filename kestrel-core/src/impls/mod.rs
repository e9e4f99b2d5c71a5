mod scalar;
mod vec;
mod array;
mod option;
mod boxed;
mod map;
mod time;
