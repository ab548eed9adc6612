//! Fixed catalogs the form offers and the prompt assembler samples from.
//!
//! Every list is kept sorted so the CLI can print it as-is.

/// Occasion that stands for "no particular occasion".
pub const ANY_OCCASION: &str = "All Occasions";

/// Cuisine that stands for "pairs with anything".
pub const ANY_CUISINE: &str = "All";

/// Main dish substituted when the user leaves the field blank.
pub const DEFAULT_MAIN_DISH: &str = "all dishes";

pub const OCCASIONS: &[&str] = &[
    "All Occasions",
    "Anniversary",
    "Birthday",
    "Father’s Day",
    "Halloween",
    "Labor Day",
    "Mother’s Day",
    "Party",
    "Retirement",
    "Team Event",
    "Thanksgiving",
    "Valentine’s Day",
    "Wedding",
];

pub const CUISINES: &[&str] = &[
    "All",
    "American",
    "Chinese",
    "Greek",
    "Indian",
    "Italian",
    "Japanese",
    "Mediterranean",
    "Mexican",
    "Thai",
];

pub const ALCOHOLIC_INGREDIENTS: &[&str] = &[
    "Agave",
    "Apple Slice",
    "Bourbon",
    "Brandy",
    "Club Soda",
    "Coffee Concentrate",
    "Coke",
    "Gin",
    "Grappa",
    "Honey",
    "Lemon Twist",
    "Mint Leaves",
    "Orange Slice",
    "Pisco",
    "Port",
    "Root Beer",
    "Rum",
    "Sherry",
    "Single Malt Scotch",
    "Tea",
    "Tequila",
    "Vermouth",
    "Vodka",
    "Whisky",
    "Wine",
];

pub const NON_ALCOHOLIC_INGREDIENTS: &[&str] = &[
    "Agave",
    "Apple",
    "Banana",
    "Blackberries",
    "Blueberries",
    "Buttermilk",
    "Club Soda",
    "Cocktail Umbrellas",
    "Coffee Concentrate",
    "Coke",
    "Edible Flowers",
    "Grapefruit Juice",
    "Honey Syrup",
    "Lassi",
    "Lavender",
    "Lemon",
    "Lemon Juice",
    "Lemon and Lime Zest",
    "Lime Juice",
    "Lyre American Malt",
    "Mango Lassi",
    "Maple Syrup",
    "Maraschino Cherry",
    "Mint Leaves",
    "Orange",
    "Orange Juice",
    "Peach",
    "Pear",
    "Pepsi",
    "Pineapple",
    "Pineapple Juice",
    "Raspberries",
    "Ritual Gin",
    "Ritual Tequila",
    "Rosemary",
    "Sage",
    "Salt Lassi",
    "Seedlip",
    "Strawberries",
    "Thyme",
    "Tonic Water",
    "Yogurt",
];

pub const COCKTAIL_INSPIRATIONS: &[&str] = &[
    "Aperol Spritz",
    "Bloody Mary",
    "Caipirinha",
    "Cosmopolitan",
    "Daiquiri",
    "Espresso Martini",
    "French 75",
    "Mai Tai",
    "Manhattan",
    "Margarita",
    "Mojito",
    "Moscow Mule",
    "Negroni",
    "Old Fashioned",
    "Paloma",
    "Pina Colada",
    "Sazerac",
    "Sidecar",
    "Tom Collins",
    "Whiskey Sour",
];

pub const MOCKTAIL_INSPIRATIONS: &[&str] = &[
    "Arnold Palmer",
    "Cinderella",
    "Mango Lassi",
    "Nojito",
    "Roy Rogers",
    "Safe Sex on the Beach",
    "Shirley Temple",
    "Virgin Colada",
    "Virgin Mary",
    "Virgin Mojito",
];

/// Find the catalog spelling of `value`, ignoring case and surrounding whitespace.
pub fn lookup(catalog: &[&'static str], value: &str) -> Option<&'static str> {
    let wanted = value.trim();
    catalog
        .iter()
        .copied()
        .find(|entry| entry.eq_ignore_ascii_case(wanted))
}
