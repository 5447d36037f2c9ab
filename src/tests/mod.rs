mod support;

mod integration_scripts;
mod unit_manifest_store;
