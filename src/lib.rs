pub mod auth;
pub mod categories;
pub mod commands;
pub mod events;
pub mod filter;
pub mod focus;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod state;
pub mod storage;

#[cfg(all(feature = "app", not(test)))]
use std::sync::Arc;

#[cfg(all(feature = "app", not(test)))]
use tauri::Manager;

#[cfg(all(feature = "app", not(test)))]
use crate::commands::*;
#[cfg(all(feature = "app", not(test)))]
use crate::logging::init_logging;
#[cfg(all(feature = "app", not(test)))]
use crate::scheduler::start_focus_ticker;
#[cfg(all(feature = "app", not(test)))]
use crate::state::AppState;
#[cfg(all(feature = "app", not(test)))]
use crate::storage::FileStore;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
#[cfg(all(feature = "app", not(test)))]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;
            if let Err(err) = init_logging(&data_dir) {
                eprintln!("failed to initialize logging: {err}");
            }

            let store = FileStore::new(data_dir);
            store.ensure_dirs()?;
            let state = AppState::load(Arc::new(store));
            app.manage(state.clone());

            state
                .tasks
                .subscribe(|event| log::debug!("store event: {event:?}"));

            start_focus_ticker(app.handle().clone(), state.focus.clone());
            log::info!("taskdash started");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            load_state,
            create_task,
            update_task,
            delete_task,
            list_categories,
            add_category,
            delete_category,
            restore_category,
            query_tasks,
            update_settings,
            focus_state,
            focus_tasks,
            focus_toggle,
            focus_reset,
            focus_skip,
            focus_switch_mode,
            focus_select_task,
            current_user,
            login,
            register,
            logout,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
