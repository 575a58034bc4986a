//! Filesystem snapshots through snapper.

use crate::modules::{AppModule, MenuEntry, RunAs, SetupStep};

pub const MODULE: AppModule = AppModule {
    name: "snapshot",
    version: 1,
    title: "Snapshots",
    description: &[
        "Snapshots allows creating and managing filesystem snapshots. These can be used to roll back the system to a previous state.",
    ],
    depends: &["system"],
    managed_packages: &["snapper"],
    action: "snapshot",
    service: None,
    menu: MenuEntry {
        section: "system",
        icon: "glyphicon-film",
        url_name: "snapshot:index",
    },
    shortcut: None,
    setup_steps: &[SetupStep {
        name: "post",
        args: &["setup"],
        run_as: RunAs::Superuser,
    }],
};
