#![allow(dead_code)]

#[derive(trellis::form::FormValues)]
struct Wrapper<T> {
    value: T,
}

fn main() {}
