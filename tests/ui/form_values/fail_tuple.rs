#![allow(dead_code)]

#[derive(trellis::form::FormValues)]
struct Pair(String, u32);

fn main() {}
