use anyhow::Result;
use motioned_animation::{register_custom_properties, HeadlessSurface};
use motioned_core::TRANSFORM_TEMPLATE;

pub fn run() -> Result<()> {
    let mut registry = HeadlessSurface::new();
    if !register_custom_properties(&mut registry) {
        anyhow::bail!("Custom properties were already registered");
    }

    for rule in registry.registered_rules() {
        println!("{}", rule);
    }
    println!();
    println!("transform: {};", TRANSFORM_TEMPLATE);
    Ok(())
}
