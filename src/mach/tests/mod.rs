use super::*;

mod operation_test;
