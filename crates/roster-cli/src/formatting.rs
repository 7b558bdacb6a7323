use roster_data::{DeleteSummary, Person, PersonSummary};

pub trait PrintFormatted {
    fn print_formatted(&self);
}

/// Render favorite foods as a comma separated list
fn foods(favorite_foods: &[String]) -> String {
    if favorite_foods.is_empty() {
        "None".to_string()
    } else {
        favorite_foods.join(", ")
    }
}

fn email(email: &Option<String>) -> String {
    match email {
        Some(email) => email.clone(),
        None => "None".to_string(),
    }
}

impl PrintFormatted for Person {
    fn print_formatted(&self) {
        let age = match self.age {
            Some(age) => age.to_string(),
            None => "None".to_string(),
        };

        println!("Id:\t\t\t{}", self.id);
        println!("Name:\t\t\t{}", self.name);
        println!("Age:\t\t\t{}", age);
        println!("Favorite Foods:\t\t{}", foods(&self.favorite_foods));
        println!("Email:\t\t\t{}", email(&self.email));
    }
}

impl PrintFormatted for PersonSummary {
    fn print_formatted(&self) {
        println!("Id:\t\t\t{}", self.id);
        println!("Name:\t\t\t{}", self.name);
        println!("Favorite Foods:\t\t{}", foods(&self.favorite_foods));
        println!("Email:\t\t\t{}", email(&self.email));
    }
}

impl PrintFormatted for DeleteSummary {
    fn print_formatted(&self) {
        println!("Deleted:\t\t{}", self.deleted_count);
    }
}

impl<T: PrintFormatted> PrintFormatted for Option<T> {
    fn print_formatted(&self) {
        match self {
            Some(item) => item.print_formatted(),
            None => println!("Nothing found."),
        }
    }
}

impl<T: PrintFormatted> PrintFormatted for Vec<T> {
    fn print_formatted(&self) {
        for item in self {
            println!();
            item.print_formatted();
        }
        println!();
        println!("{} results.", self.len());
    }
}
