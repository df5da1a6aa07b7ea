use backend::shared::config;
use backend::shared::data::DataManager;
use contracts::shared::variant::FILM_CATALOG;
use frontend::console::Console;

fn main() -> anyhow::Result<()> {
    if let Err(e) = backend::system::tracing::initialize() {
        eprintln!("Не удалось инициализировать журнал: {}", e);
    }

    let config = config::load_config()?;
    let suppliers_path = config::get_suppliers_file_path(&config);
    let films_path = config::get_films_file_path(&config);
    tracing::info!(
        "Файлы данных: {}, {}",
        suppliers_path.display(),
        films_path.display()
    );

    let mut store = DataManager::open(suppliers_path, films_path, FILM_CATALOG)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Console::new(&mut store, stdin.lock(), stdout.lock()).run()?;

    tracing::info!("Работа завершена");
    Ok(())
}
