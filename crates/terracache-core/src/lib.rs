pub mod context;
pub mod errors;
pub mod state;

#[cfg(test)]
mod tests;

pub use context::Context;
pub use errors::StateError;
pub use state::file::{
    find_terraform_state_file, parse_terraform_state_file,
    parse_terraform_state_file_from_location, DEFAULT_DATA_DIR, DEFAULT_STATE_FILE_NAME,
};
pub use state::{
    parse_terraform_state, JsonMap, TerraformBackend, TerraformState, TerraformStateModule,
};
