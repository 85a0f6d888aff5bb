pub mod backup;
pub mod config;
pub mod stock;
pub mod system;
pub mod views;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        views::definitions(),
        stock::definitions(),
        backup::definitions(),
        config::definitions(),
        system::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}
