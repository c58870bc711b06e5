use trellis::form::{FormMap, FormProvider, FormValue};

#[derive(Clone, trellis::form::FormValues)]
struct Address {
    city: String,
}

#[derive(Clone, trellis::form::FormValues)]
struct Signup {
    email: String,
    age: u32,
    address: Address,
}

fn main() {
    let signup = Signup {
        email: "a@trellis.dev".to_string(),
        age: 30,
        address: Address {
            city: "Lisbon".to_string(),
        },
    };

    let values = FormMap::from(signup.clone());
    assert_eq!(values.get("email"), Some(&FormValue::from("a@trellis.dev")));

    let form = FormProvider::builder("signup").values(signup).build();
    assert_eq!(form.leaves(), vec!["email", "age", "address.city"]);
    assert_eq!(form.value_for("age"), Some(FormValue::from(30_u32)));
}
