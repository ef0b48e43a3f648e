use super::*;

mod symbol_test;
