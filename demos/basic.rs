// SPDX-License-Identifier: MPL-2.0
//! Pops a few toasts on the tokio scheduler and prints the collection as the
//! timers expire.
//!
//! Run with `RUST_LOG=toaster_core=debug cargo run --example basic` to see
//! the lifecycle events.

use std::rc::Rc;
use std::time::Duration;
use toaster_core::config::Overrides;
use toaster_core::notifications::{TokioScheduler, Toaster, ToasterContainer};
use toaster_core::{EventRegistry, ToastKind, ToastRequest};
use tracing_subscriber::EnvFilter;

fn print_toasts(label: &str, container: &ToasterContainer) {
    println!("{label}:");
    for toast in container.toasts() {
        println!(
            "  #{} [{}] {} - {} ({:?})",
            toast.id(),
            toast.icon_class(),
            toast.title().unwrap_or_default(),
            toast.body().unwrap_or_default(),
            toast.timeout(),
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let overrides = Overrides::from_toml_str(
        r#"
        time-out = { toast-info = 300, toast-success = 600 }
        close-button = { toast-error = true }
        newest-on-top = true
        "#,
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let local = tokio::task::LocalSet::new();

    local.block_on(&runtime, async {
        let registry = EventRegistry::new();
        let mut container =
            ToasterContainer::mount(&registry, &overrides, Rc::new(TokioScheduler::new()));
        let toaster = Toaster::new(registry);

        toaster.info("Heads up", "Indexing started");
        toaster.success("Saved", "Document saved");
        toaster.error("Failed", "Upload rejected");
        toaster.pop(
            ToastRequest::of_kind(ToastKind::Warning)
                .title("Quota")
                .body("90% used")
                .timeout(450),
        );
        print_toasts("initial", &container);

        for step in 1..=3 {
            tokio::time::sleep(Duration::from_millis(250)).await;
            print_toasts(&format!("after {}ms", step * 250), &container);
        }

        toaster.clear_all();
        print_toasts("after clear", &container);
        container.teardown();
    });

    Ok(())
}
