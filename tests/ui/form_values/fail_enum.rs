#![allow(dead_code)]

#[derive(trellis::form::FormValues)]
enum Plan {
    Basic,
    Pro,
}

fn main() {}
