//! Terminal front end: one subcommand per portal action

use std::io::{self, Write};

use anyhow::{Result, bail};
use clap::{Args, Subcommand, builder::PossibleValuesParser};

use auth::{ProfileUpdate, validation::validate_optional_url};
use portal::{
    AppState, Navigator, Route, Screen,
    models::{ApplyForm, DOCUMENT_OPTIONS, Visa, VisaForm, VisaType},
    views::{
        AddVisaView, AllVisasView, ConfirmPrompt, HomeView, LoginView, MutationOutcome,
        MyAddedVisasView, MyApplicationsView, RegisterForm, RegisterView, VisaDetailsView,
        VisaTypeFilter,
    },
};

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password, or through Google
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Use the Google identity provider
        #[arg(long)]
        google: bool,
        /// Location to continue at after signing in
        #[arg(long)]
        from: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Profile photo URL
        #[arg(long)]
        photo: Option<String>,
        /// Use the Google identity provider
        #[arg(long)]
        google: bool,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update display name and/or photo
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        photo: Option<String>,
    },
    /// Latest visas
    Home,
    /// All visas, optionally filtered by type
    Visas {
        /// `all`, or a visa type such as `student`
        #[arg(long = "type", default_value = "all")]
        visa_type: String,
    },
    /// Details of one visa
    Visa { id: String },
    /// Add a visa listing
    AddVisa(VisaArgs),
    /// Visas you added
    MyVisas,
    /// Update one of your visas; omitted fields keep their value
    UpdateVisa {
        id: String,
        #[command(flatten)]
        changes: VisaArgs,
    },
    /// Delete one of your visas
    DeleteVisa {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Apply for a visa
    Apply {
        id: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Your visa applications
    Applications {
        /// Filter by country (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Cancel one of your applications
    CancelApplication {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Open a portal path such as `/my-added-visas`
    Open { path: String },
}

/// Listing fields; on update, omitted fields keep their current value
#[derive(Args)]
pub struct VisaArgs {
    #[arg(long)]
    country: Option<String>,
    /// Country image URL
    #[arg(long)]
    image: Option<String>,
    /// Visa type, e.g. `tourist` or `Student visa`
    #[arg(long = "type")]
    visa_type: Option<String>,
    #[arg(long)]
    processing_time: Option<String>,
    /// Required document; repeat for several
    #[arg(long = "document", value_parser = PossibleValuesParser::new(DOCUMENT_OPTIONS))]
    documents: Vec<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    age_restriction: Option<String>,
    #[arg(long)]
    fee: Option<String>,
    #[arg(long)]
    validity: Option<String>,
    /// Application method
    #[arg(long)]
    method: Option<String>,
}

impl VisaArgs {
    fn apply_to(self, mut form: VisaForm) -> VisaForm {
        let fields = [
            (&mut form.country, self.country),
            (&mut form.country_image, self.image),
            (&mut form.processing_time, self.processing_time),
            (&mut form.description, self.description),
            (&mut form.age_restriction, self.age_restriction),
            (&mut form.fee, self.fee),
            (&mut form.validity, self.validity),
            (&mut form.application_method, self.method),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }

        if let Some(visa_type) = self.visa_type {
            form.visa_type = VisaType::parse(&visa_type);
        }
        if !self.documents.is_empty() {
            form.required_documents.clear();
            for document in &self.documents {
                form.toggle_document(document, true);
            }
        }
        form
    }
}

pub async fn run(command: Commands, state: &AppState) -> Result<()> {
    match command {
        Commands::Login {
            email,
            password,
            google,
            from,
        } => {
            let view = LoginView::new(state.session_store.clone(), from);
            let destination = if google {
                view.sign_in_with_provider().await?
            } else {
                view.sign_in(&email.unwrap_or_default(), &password.unwrap_or_default())
                    .await?
            };
            println!("Continue at {}", destination);
        }
        Commands::Register {
            name,
            email,
            password,
            photo,
            google,
        } => {
            let view = RegisterView::new(state.session_store.clone());
            let session = if google {
                view.register_with_provider().await?
            } else {
                let form = RegisterForm {
                    name: name.unwrap_or_default(),
                    email: email.unwrap_or_default(),
                    photo_url: photo.unwrap_or_default(),
                    password: password.unwrap_or_default(),
                };
                view.register(&form).await?
            };
            println!("Registered as {} <{}>", session.display_name, session.email);
        }
        Commands::Logout => state.session_store.sign_out().await?,
        Commands::Whoami => match state.session_store.current_session() {
            Some(session) => {
                println!("{} <{}>", session.display_name, session.email);
                println!("uid:   {}", session.uid);
                println!("photo: {}", session.photo_url);
            }
            None => println!("Not signed in"),
        },
        Commands::Profile { name, photo } => {
            if name.is_none() && photo.is_none() {
                bail!("Nothing to update: pass --name and/or --photo");
            }
            validate_optional_url("Photo URL", photo.as_deref())?;
            let session = state
                .session_store
                .update_profile(&ProfileUpdate { name, photo })
                .await?;
            println!("{} <{}>", session.display_name, session.email);
        }
        Commands::Home => show_home(state).await?,
        Commands::Visas { visa_type } => show_all_visas(state, VisaTypeFilter::parse(&visa_type)).await?,
        Commands::Visa { id } => {
            enter(state, &Route::VisaDetails { id: id.clone() }.path())?;
            show_visa(state, &id).await?;
        }
        Commands::AddVisa(args) => {
            enter(state, &Route::AddVisa.path())?;
            let view = AddVisaView::new(state);
            match view.submit(&args.apply_to(VisaForm::default())).await? {
                Some(visa) => println!("Added {} ({})", visa.country, visa.id),
                None => println!("The server did not add the visa"),
            }
        }
        Commands::MyVisas => {
            enter(state, &Route::MyAddedVisas.path())?;
            show_my_visas(state).await?;
        }
        Commands::UpdateVisa { id, changes } => {
            enter(state, &Route::MyAddedVisas.path())?;
            let view = MyAddedVisasView::new(state);
            view.load().await?;
            let Some(form) = view.edit_form(&id) else {
                bail!("Visa {} is not one of your listings", id);
            };
            let outcome = view.update(&id, &changes.apply_to(form)).await?;
            report(outcome, "Visa updated");
        }
        Commands::DeleteVisa { id, yes } => {
            enter(state, &Route::MyAddedVisas.path())?;
            let view = MyAddedVisasView::new(state);
            view.load().await?;
            let outcome = view.delete(&id, &stdin_confirm(yes)).await?;
            report(outcome, "Visa deleted");
        }
        Commands::Apply {
            id,
            first_name,
            last_name,
        } => {
            enter(state, &Route::VisaDetails { id: id.clone() }.path())?;
            let view = VisaDetailsView::new(state, id);
            view.load().await?;
            let form = ApplyForm {
                first_name,
                last_name,
            };
            report(view.apply(&form).await?, "Application submitted");
        }
        Commands::Applications { search } => {
            enter(state, &Route::MyVisaApplications.path())?;
            show_applications(state, search).await?;
        }
        Commands::CancelApplication { id, yes } => {
            enter(state, &Route::MyVisaApplications.path())?;
            let view = MyApplicationsView::new(state);
            view.load().await?;
            let outcome = view.cancel(&id, &stdin_confirm(yes)).await?;
            report(outcome, "Application cancelled");
        }
        Commands::Open { path } => open(state, &path).await?,
    }

    Ok(())
}

/// Navigate to `path` through the guard; fails unless the view may render
fn enter(state: &AppState, path: &str) -> Result<Route> {
    let mut navigator = Navigator::new(state.session_store.clone());
    match navigator.navigate(path) {
        Screen::View(route) => Ok(route),
        Screen::Redirected(redirect) => bail!(
            "Sign in required: run `visa-portal login --from {}`",
            redirect.from
        ),
        Screen::Progress => bail!("Session is still loading"),
        Screen::NotFound => bail!("Page not found: {}", path),
    }
}

async fn open(state: &AppState, path: &str) -> Result<()> {
    let mut navigator = Navigator::new(state.session_store.clone());
    let route = match navigator.navigate(path) {
        Screen::View(route) => route,
        Screen::Redirected(redirect) => {
            println!("Redirected to {} (from {})", redirect.to, redirect.from);
            println!("Run `visa-portal login --from {}` to continue", redirect.from);
            return Ok(());
        }
        Screen::Progress => {
            println!("Loading...");
            return Ok(());
        }
        Screen::NotFound => {
            println!("404 - Page not found: {}", path);
            return Ok(());
        }
    };

    match route {
        Route::Home => show_home(state).await?,
        Route::AllVisas => show_all_visas(state, VisaTypeFilter::All).await?,
        Route::VisaDetails { id } => show_visa(state, &id).await?,
        Route::MyAddedVisas => show_my_visas(state).await?,
        Route::MyVisaApplications => show_applications(state, None).await?,
        Route::AddVisa => println!("Use `visa-portal add-visa --help` to add a listing"),
        Route::Login => println!("Use `visa-portal login` to sign in"),
        Route::Register => println!("Use `visa-portal register` to create an account"),
    }
    Ok(())
}

async fn show_home(state: &AppState) -> Result<()> {
    let view = HomeView::new(state);
    view.load().await?;
    println!("Latest visas");
    print_visa_rows(&view.latest());
    Ok(())
}

async fn show_all_visas(state: &AppState, filter: VisaTypeFilter) -> Result<()> {
    let view = AllVisasView::new(state);
    view.load().await?;
    view.set_filter(filter);
    println!("All visas ({})", view.filter());
    print_visa_rows(&view.visible());
    Ok(())
}

async fn show_visa(state: &AppState, id: &str) -> Result<()> {
    let view = VisaDetailsView::new(state, id);
    let visa = view.load().await?;

    println!("{} - {}", visa.country, visa.visa_type);
    println!("  Processing time:    {}", visa.processing_time);
    println!("  Fee:                ${}", visa.fee);
    println!("  Validity:           {}", visa.validity);
    println!("  Age restriction:    {}", visa.age_restriction);
    println!("  Application method: {}", visa.application_method);
    println!("  Required documents: {}", visa.required_documents.join(", "));
    println!("  {}", visa.description);
    if let Some(name) = &visa.added_by_name {
        println!("  Added by {}", name);
    }
    Ok(())
}

async fn show_my_visas(state: &AppState) -> Result<()> {
    let view = MyAddedVisasView::new(state);
    view.load().await?;
    println!("My added visas");
    print_visa_rows(&view.visas());
    Ok(())
}

async fn show_applications(state: &AppState, search: Option<String>) -> Result<()> {
    let view = MyApplicationsView::new(state);
    view.load().await?;
    if let Some(term) = search {
        view.set_search(term);
    }

    let applications = view.visible();
    if applications.is_empty() {
        println!("No applications");
    }
    for application in applications {
        println!(
            "{:<26} {:<14} {:<16} ${:<6} {} ({})",
            application.id,
            application.country,
            application.visa_type,
            application.fee,
            application.applied_date,
            application.applicant_name()
        );
    }
    Ok(())
}

fn print_visa_rows(visas: &[Visa]) {
    if visas.is_empty() {
        println!("No visas found");
    }
    for visa in visas {
        println!(
            "{:<26} {:<14} {:<16} ${:<6} {}",
            visa.id, visa.country, visa.visa_type, visa.fee, visa.processing_time
        );
    }
}

fn report(outcome: MutationOutcome, applied: &str) {
    match outcome {
        MutationOutcome::Applied => println!("{}", applied),
        MutationOutcome::NoOp => println!("Nothing changed"),
        MutationOutcome::Declined => println!("Cancelled"),
    }
}

/// Confirmation read from stdin; `assume_yes` answers every prompt
fn stdin_confirm(assume_yes: bool) -> impl Fn(&ConfirmPrompt) -> bool {
    move |prompt: &ConfirmPrompt| {
        if assume_yes {
            return true;
        }

        eprint!("{} {} {} [y/N] ", prompt.title, prompt.text, prompt.confirm_label);
        if io::stderr().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        io::stdin().read_line(&mut answer).is_ok()
            && matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
